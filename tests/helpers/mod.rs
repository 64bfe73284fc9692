pub mod api_test_helper;
pub mod mock_source;
pub mod test_data_builder;
