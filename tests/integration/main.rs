//! Integration test modules.

mod pipeline_roundtrip_test;
mod sheets_api_test;
