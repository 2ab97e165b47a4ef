// Route handlers, split by whether the auth gate runs in front of them.
pub mod protected;
pub mod public;
