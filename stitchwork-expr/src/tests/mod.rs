mod builtin_tests;
mod interpreter_tests;
mod parser_tests;
