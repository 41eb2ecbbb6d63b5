mod explorer_tests;
mod search_tests;
