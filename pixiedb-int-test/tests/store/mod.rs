mod scan_test;
mod store_test;
