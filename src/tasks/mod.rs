pub mod digest_loop;
