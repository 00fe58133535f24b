//! I/O modules: identity endpoint, Process API, raster and vector readers

pub mod auth;
pub mod process;
pub mod raster;
pub mod vector;

pub use auth::{AccessToken, AuthClient};
pub use process::{ProcessClient, ProcessRequest};
pub use raster::SceneReader;
pub use vector::BoundaryReader;
