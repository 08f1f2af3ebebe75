/// Id of the user whose presence marks the seed fixture as already loaded
pub const SEED_SENTINEL_USER_ID: &str = "62a29c15f4605c4c9fa7f306";

/// Version of the embedded seed fixture
pub const SEED_FIXTURE_VERSION: u32 = 1;
