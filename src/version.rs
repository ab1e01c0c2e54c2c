/// Version string embedded at build time by build.rs.
pub const GIT_VERSION: &str = env!("GIT_VERSION");
