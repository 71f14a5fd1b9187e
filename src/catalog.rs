// Copyright (c) 2026 rezky_nightky

use rand::Rng;

/// Fragments a particle can carry. Repeats are intentional: they weight the
/// draw towards the signature line.
pub const SNIPPETS: [&str; 23] = [
    "const magic = () => {",
    "  return creativity;",
    "};",
    "function innovate() {",
    "  while (true) {",
    "    createAmazing();",
    " DigitalizeBro }",
    "  }",
    "}",
    "export default Dreams;",
    "import { Future } from \"now\";",
    "const vision = new Promise();",
    "async function craft() {",
    "  await excellence();",
    " DigitalizeBro }",
    "}",
    "React.createElement(\"success\")",
    "{ transform: \"dreams\" }",
    ".container { magic: true; }",
    "npm install happiness",
    "git commit -m \"life\"",
    "console.log(\"hello world\");",
    " DigitalizeBro }",
];

pub fn pick_random<'a, R: Rng + ?Sized>(catalog: &[&'a str], rng: &mut R) -> &'a str {
    if catalog.is_empty() {
        return "";
    }
    catalog[rng.random_range(0..catalog.len())]
}

pub fn print_list_snippets() {
    println!("SNIPPET CATALOG ({} entries):", SNIPPETS.len());
    for (i, s) in SNIPPETS.iter().enumerate() {
        println!("  {:>2}  {}", i + 1, s);
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn pick_random_stays_inside_catalog() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let s = pick_random(&SNIPPETS, &mut rng);
            assert!(SNIPPETS.contains(&s));
        }
    }

    #[test]
    fn pick_random_is_reproducible_with_seed() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let xs: Vec<&str> = (0..32).map(|_| pick_random(&SNIPPETS, &mut a)).collect();
        let ys: Vec<&str> = (0..32).map(|_| pick_random(&SNIPPETS, &mut b)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn pick_random_reaches_every_entry() {
        let catalog = ["a", "b", "c"];
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = [false; 3];
        for _ in 0..300 {
            match pick_random(&catalog, &mut rng) {
                "a" => seen[0] = true,
                "b" => seen[1] = true,
                _ => seen[2] = true,
            }
        }
        assert!(seen.iter().all(|&v| v));
    }

    #[test]
    fn signature_line_repeats() {
        let n = SNIPPETS.iter().filter(|s| **s == " DigitalizeBro }").count();
        assert_eq!(n, 3);
    }
}
