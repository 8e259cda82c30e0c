use std::cmp::Ordering;
use uplift::core::version::compare_versions;
use uplift::core::UpliftResult;

pub fn run(a: &str, b: &str) -> UpliftResult<()> {
    println!("{}", describe(a, b));
    Ok(())
}

fn describe(a: &str, b: &str) -> String {
    let symbol = match compare_versions(a, b) {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    };
    format!("{} {} {}", a, symbol, b)
}
