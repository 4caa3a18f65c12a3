mod fixtures;
mod login_tests;
mod logout_tests;
mod scenario_tests;
