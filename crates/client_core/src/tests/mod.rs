mod lib_tests;
mod mock_server;
