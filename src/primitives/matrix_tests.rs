pub(crate) use super::*;

#[test]
fn test_from_vec() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.shape(), (2, 3));
    assert!((m.get(0, 0) - 1.0).abs() < 1e-6);
    assert!((m.get(1, 2) - 6.0).abs() < 1e-6);
}

#[test]
fn test_from_vec_error() {
    let result = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0]);
    assert!(result.is_err());
}

#[test]
fn test_from_rows() {
    let m = Matrix::from_rows(&[vec![1.0_f32, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]])
        .expect("rows have equal length");
    assert_eq!(m.shape(), (3, 2));
    assert_eq!(m.row(2), &[5.0, 6.0]);
}

#[test]
fn test_from_rows_ragged() {
    let result = Matrix::from_rows(&[vec![1.0_f32, 2.0], vec![3.0]]);
    assert!(result.is_err());
}

#[test]
fn test_zeros() {
    let m = Matrix::<f32>::zeros(2, 3);
    assert_eq!(m.shape(), (2, 3));
    assert!(m.as_slice().iter().all(|&x| x == 0.0));

    let counts = Matrix::<usize>::zeros(3, 3);
    assert!(counts.as_slice().iter().all(|&x| x == 0));
}

#[test]
fn test_set_and_column() {
    let mut m = Matrix::<f32>::zeros(3, 2);
    m.set(1, 1, 7.0);
    assert_eq!(m.column(1), vec![0.0, 7.0, 0.0]);
}

#[test]
fn test_select_columns_preserves_order() {
    let m = Matrix::from_vec(2, 4, vec![0.0_f32, 1.0, 2.0, 3.0, 10.0, 11.0, 12.0, 13.0])
        .expect("2*4=8 elements");
    let p = m.select_columns(&[3, 1]);
    assert_eq!(p.shape(), (2, 2));
    assert_eq!(p.as_slice(), &[3.0, 1.0, 13.0, 11.0]);
}

#[test]
fn test_select_columns_empty() {
    let m = Matrix::from_vec(2, 2, vec![1.0_f32, 2.0, 3.0, 4.0]).expect("2*2=4 elements");
    let p = m.select_columns(&[]);
    assert_eq!(p.shape(), (2, 0));
}

#[test]
fn test_select_rows_with_duplicates() {
    let m = Matrix::from_vec(3, 2, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("3*2=6");
    let p = m.select_rows(&[2, 2, 0]);
    assert_eq!(p.shape(), (3, 2));
    assert_eq!(p.as_slice(), &[5.0, 6.0, 5.0, 6.0, 1.0, 2.0]);
}

#[test]
fn test_argmax_rows_ties_go_low() {
    let m = Matrix::from_vec(3, 3, vec![0.2_f32, 0.5, 0.3, 0.4, 0.4, 0.2, 0.0, 0.0, 1.0])
        .expect("3*3=9");
    assert_eq!(m.argmax_rows(), vec![1, 0, 2]);
}
