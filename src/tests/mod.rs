pub mod lookup_test;
