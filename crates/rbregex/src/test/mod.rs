// Test module organization
pub mod test_backref;
pub mod test_encoding;
pub mod test_matching;
pub mod test_timeout;
pub mod test_union;
