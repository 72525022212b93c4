/// Asserts that two scores are equal up to a relative error of `epsilon`.
///
/// `epsilon` defaults to `0.0005`.
#[cfg(test)]
macro_rules! assert_nearly_equals {
    ($left:expr, $right:expr) => {{
        assert_nearly_equals!($left, $right, 0.0005);
    }};
    ($left:expr, $right:expr, $epsilon:expr) => {{
        match (&$left, &$right, &$epsilon) {
            (left_val, right_val, epsilon_val) => {
                let diff = (left_val - right_val).abs();
                let add = left_val.abs() + right_val.abs();
                if diff > *epsilon_val * add {
                    panic!(
                        r#"assertion failed: `(left ~= right)`
  left: `{:?}`,
 right: `{:?}`,
 epsilon: `{:?}`"#,
                        &*left_val, &*right_val, &*epsilon_val
                    )
                }
            }
        }
    }};
}
