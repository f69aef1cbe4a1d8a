mod field_tests;
mod registry_tests;
