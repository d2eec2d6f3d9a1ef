mod login_test;
mod routes_test;
