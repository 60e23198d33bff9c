pub mod product_writer;
