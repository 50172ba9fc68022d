/// Группирует разряды числа по три с заданным разделителем
///
/// # Примеры
/// ```ignore
/// assert_eq!(group_thousands(1234567, '.'), "1.234.567");
/// assert_eq!(group_thousands(42, ' '), "42");
/// ```
pub fn group_thousands(n: usize, separator: char) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(separator);
        }
        result.push(ch);
    }
    result
}
