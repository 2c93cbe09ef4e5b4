pub mod resources;

pub use resources::{Autoscaler, DeploymentConfig, Group, Image, Kind, Project, Resource, ScaleTarget, User};
