pub const STORE: &str = "store";
pub const RECORDS: &str = "records";
pub const CONFIG: &str = "config";
pub const UI: &str = "ui";
