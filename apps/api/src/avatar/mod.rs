// Avatar generation: photo capture, model relay, output normalization and
// the caller-side client that never leaves the user without an avatar.

pub mod client;
pub mod handlers;
pub mod normalizer;
pub mod params;
pub mod photo;
pub mod provider;

#[cfg(test)]
pub mod testing;
