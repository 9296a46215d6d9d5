mod db_test;
mod lecture_test;
mod session_test;
