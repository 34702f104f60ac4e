mod rollover_tests;
