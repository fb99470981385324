mod analysis_tests;
mod api_tests;
mod property_tests;
