use miette::Result;
use yankee::run;

fn main() -> Result<()> {
    run()
}
