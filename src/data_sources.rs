//! Read-only data sources exposed by the provider.

pub mod artifact_version;
pub mod cognito_info;

pub use artifact_version::ArtifactVersionDataSource;
pub use cognito_info::CognitoInfoDataSource;
