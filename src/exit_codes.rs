/// Exit codes for CI/automation.
pub const SUCCESS: i32 = 0;
pub const STEPS_FAILED: i32 = 1;
pub const ENVIRONMENT_MISSING: i32 = 2;
pub const USER_DECLINED: i32 = 3;
pub const RUNTIME_ERROR: i32 = 4;
pub const INTERRUPTED: i32 = 130;
