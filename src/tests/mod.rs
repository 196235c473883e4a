mod api_tests;
mod polling_tests;
