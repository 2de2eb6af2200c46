use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    protein_pipeline::apps::run_curate(std::env::args().skip(1))
}
