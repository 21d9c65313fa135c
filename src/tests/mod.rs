mod utils;

mod domain_tests;
