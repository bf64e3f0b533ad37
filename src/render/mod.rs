pub mod animation;
pub mod atlas;
pub mod batch;
pub mod resolver;
pub mod target;
pub mod texcoords;
