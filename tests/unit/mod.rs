/// Unit-level property tests for storage decoding and analytics
mod analytics_properties;
mod storage_decoding;
