//! Build, query, edit and score a small entity partition.

use erlink::{match_quality, ClusterId, ClusterPartition, Linked};

fn main() {
    // Overlapping groups from two alignment sources: {a1, b1, c1} share members.
    let groups = vec![
        vec!["a1", "b1"],
        vec!["b1", "c1"],
        vec!["a2", "b2"],
        vec!["a3", "b3"],
    ];
    let mut predicted = ClusterPartition::from_sets(groups).unwrap();
    println!("=== Initial partition ===");
    println!("  {predicted}");
    println!("  {}", predicted.info());

    match predicted.links("a1").unwrap() {
        Linked::One(e) => println!("  a1 is linked to {e}"),
        Linked::Many(set) => println!("  a1 is linked to {set:?}"),
    }

    // Edits.
    predicted.add_to_cluster(ClusterId(1), "c2").unwrap();
    let outcome = predicted.add_link("a3", "a2").unwrap();
    println!("\n=== After edits ===");
    println!("  add_link(a3, a2) => {outcome:?}");
    predicted.remove("c1").unwrap();
    println!("  {predicted}");

    // Score against a gold standard.
    let gold = ClusterPartition::from_links(vec![
        ("a1", "b1"),
        ("a2", "b2"),
        ("a3", "b3"),
        ("c1", "c2"),
    ])
    .unwrap();
    let q = match_quality(&predicted, &gold);
    println!("\n=== Match quality ===");
    println!(
        "  precision {:.3}  recall {:.3}  f1 {:.3}",
        q.precision, q.recall, q.fmeasure
    );

    let sample = predicted.sample(1, Some(42)).unwrap();
    println!("\n=== Sample (seed 42) ===");
    println!("  {sample}");
}
