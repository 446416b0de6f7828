#![allow(dead_code, unused_imports)]

pub use fscanary_test_utils::builders;
pub use fscanary_test_utils::{init_tracing, with_timeout, RecordingTransport};
