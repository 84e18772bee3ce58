pub mod coordinator;
pub mod dispatcher;
pub mod enigo_backend;
pub mod input;
pub mod keys;
pub mod launcher;
pub mod normalizer;
pub mod platform;
pub mod safety;
pub mod text_input;

#[cfg(test)]
pub(crate) mod mock;
