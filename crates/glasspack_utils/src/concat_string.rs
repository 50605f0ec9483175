/// Concatenates string expressions with a single allocation.
#[macro_export]
macro_rules! concat_string {
  () => { String::new() };
  ($($s:expr),+ $(,)?) => {{
    let mut buf = String::with_capacity(0 $(+ AsRef::<str>::as_ref(&$s).len())+);
    $(buf.push_str(AsRef::<str>::as_ref(&$s));)+
    buf
  }};
}

#[test]
fn concatenates_mixed_str_kinds() {
  let owned = String::from("b");
  assert_eq!(concat_string!("a", owned, "c"), "abc");
  assert_eq!(concat_string!(), "");
}
