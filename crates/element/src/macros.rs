//! Construction macros.

/// Builds a [`Props`](crate::props::Props) map from `name => value` pairs.
///
/// Values are converted through [`Into<Value>`](crate::value::Value), and
/// fields keep their written order.
///
/// ```
/// use arbor_element::props;
///
/// let props = props! {
///     "color" => "red",
///     "width" => 12,
/// };
/// assert_eq!(props.len(), 2);
/// ```
#[macro_export]
macro_rules! props {
	() => {
		$crate::props::Props::new()
	};
	($($name:expr => $value:expr),+ $(,)?) => {
		$crate::props::Props::new()$(.with($name, $value))+
	};
}
