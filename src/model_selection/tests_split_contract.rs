// =========================================================================
// Stratified split contract
//
// Every row lands in exactly one partition, class proportions survive the
// cut, and the same seed reproduces the same partition.
// =========================================================================

use super::*;

fn labelled(y: Vec<usize>, n_classes: usize) -> Dataset {
    let n = y.len();
    let x = Matrix::from_vec(n, 1, (0..n).map(|i| i as f32).collect()).expect("n x 1");
    Dataset::new(
        vec!["row".into()],
        x,
        y,
        (0..n_classes).map(|c| c.to_string()).collect(),
    )
    .expect("dataset")
}

#[test]
fn every_row_in_exactly_one_partition() {
    let ds = labelled((0..40).map(|i| i % 3).collect(), 3);
    let split = stratified_split(&ds, 0.7, 1).expect("split");

    let mut rows: Vec<usize> = split
        .train_x
        .column(0)
        .iter()
        .chain(split.test_x.column(0).iter())
        .map(|&v| v as usize)
        .collect();
    rows.sort_unstable();
    assert_eq!(rows, (0..40).collect::<Vec<_>>());
}

#[test]
fn class_proportions_preserved() {
    // 30 of class 0, 10 of class 1
    let y: Vec<usize> = (0..40).map(|i| usize::from(i >= 30)).collect();
    let split = stratified_split(&labelled(y, 2), 0.7, 5).expect("split");

    let train_ones = split.train_y.iter().filter(|&&c| c == 1).count();
    let test_ones = split.test_y.iter().filter(|&&c| c == 1).count();
    assert_eq!(train_ones, 7);
    assert_eq!(test_ones, 3);
    assert_eq!(split.train_y.len(), 28);
}

#[test]
fn labels_stay_aligned_with_rows() {
    let y: Vec<usize> = (0..20).map(|i| i % 2).collect();
    let split = stratified_split(&labelled(y, 2), 0.5, 8).expect("split");
    for (r, &label) in split.test_y.iter().enumerate() {
        let original = split.test_x.get(r, 0) as usize;
        assert_eq!(label, original % 2);
    }
}

#[test]
fn singleton_class_goes_to_train() {
    let mut y = vec![0; 10];
    y.push(1);
    let split = stratified_split(&labelled(y, 2), 0.7, 3).expect("split");
    assert!(split.train_y.contains(&1));
    assert!(!split.test_y.contains(&1));
}

#[test]
fn same_seed_same_partition() {
    let ds = labelled((0..30).map(|i| i % 2).collect(), 2);
    let a = stratified_split(&ds, 0.7, 77).expect("a");
    let b = stratified_split(&ds, 0.7, 77).expect("b");
    assert_eq!(a.train_x.as_slice(), b.train_x.as_slice());
}

#[test]
fn ratio_out_of_range_is_configuration_error() {
    let ds = labelled(vec![0, 1, 0, 1], 2);
    for ratio in [0.0, 1.0, -0.2, f64::NAN] {
        let err = stratified_split(&ds, ratio, 0).expect_err("bad ratio");
        assert!(err.is_configuration(), "ratio {ratio}");
    }
}
