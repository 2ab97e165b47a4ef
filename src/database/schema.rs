//! Table definitions, applied in order at startup.

// Character limits of the VARCHAR columns below. Request validation checks
// against these so oversized input is a 400, not a failed insert.
pub const USERNAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 255;
pub const CATEGORY_NAME_MAX_CHARS: usize = 100;
pub const RECIPE_TITLE_MAX_CHARS: usize = 255;
pub const INGREDIENT_NAME_MAX_CHARS: usize = 255;
pub const INGREDIENT_QUANTITY_MAX_CHARS: usize = 50;

pub const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username VARCHAR(100) NOT NULL,
        email VARCHAR(255) UNIQUE NOT NULL,
        password_hash VARCHAR(255) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id UUID PRIMARY KEY,
        name VARCHAR(100) UNIQUE NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recipes (
        id UUID PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        prep_time INT NOT NULL DEFAULT 0,
        category_id UUID REFERENCES categories(id) ON DELETE SET NULL,
        creator_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        images TEXT[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ingredients (
        id UUID PRIMARY KEY,
        recipe_id UUID NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        position INT NOT NULL,
        name VARCHAR(255) NOT NULL,
        quantity VARCHAR(50) NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS steps (
        id UUID PRIMARY KEY,
        recipe_id UUID NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        step_number INT NOT NULL,
        description TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS recipes_category_idx ON recipes (category_id)",
    "CREATE INDEX IF NOT EXISTS recipes_creator_idx ON recipes (creator_id)",
    "CREATE INDEX IF NOT EXISTS ingredients_recipe_idx ON ingredients (recipe_id)",
    "CREATE INDEX IF NOT EXISTS steps_recipe_idx ON steps (recipe_id)",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str) -> &'static str {
        STATEMENTS
            .iter()
            .copied()
            .find(|s| s.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", name)))
            .unwrap_or_else(|| panic!("no table {}", name))
    }

    #[test]
    fn column_limits_match_validation_constants() {
        let cases = [
            ("users", "username", USERNAME_MAX_CHARS),
            ("users", "email", EMAIL_MAX_CHARS),
            ("categories", "name", CATEGORY_NAME_MAX_CHARS),
            ("recipes", "title", RECIPE_TITLE_MAX_CHARS),
            ("ingredients", "name", INGREDIENT_NAME_MAX_CHARS),
            ("ingredients", "quantity", INGREDIENT_QUANTITY_MAX_CHARS),
        ];
        for (name, column, max) in cases {
            let expected = format!("{} VARCHAR({})", column, max);
            assert!(table(name).contains(&expected), "{}.{} is not {}", name, column, expected);
        }
    }
}
