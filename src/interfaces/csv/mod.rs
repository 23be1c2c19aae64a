pub mod coordinates_reader;
pub mod ranking_writer;
