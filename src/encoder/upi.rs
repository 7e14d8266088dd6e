use url::form_urlencoded;

/// Scheme root of every UPI payment payload
pub const UPI_ROOT: &str = "upi://pay";
/// Payee name placeholder; most payment apps refuse a request without one
pub const PAYEE_NAME: &str = "Payee";
/// Currency code appended to every request
pub const CURRENCY: &str = "INR";

/// Build a `upi://pay` request. Keys are written as `pa, pn, am?, cu`.
pub fn payment_uri(payee_id: &str, amount: Option<&str>) -> String {
    if payee_id.is_empty() {
        return UPI_ROOT.to_string();
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("pa", payee_id);
    query.append_pair("pn", PAYEE_NAME);
    if let Some(amount) = amount.filter(|a| !a.is_empty()) {
        query.append_pair("am", amount);
    }
    query.append_pair("cu", CURRENCY);

    format!("{UPI_ROOT}?{}", query.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payee_is_bare_root() {
        assert_eq!(payment_uri("", Some("10")), "upi://pay");
        assert_eq!(payment_uri("", None), "upi://pay");
    }

    #[test]
    fn test_parameter_order() {
        assert_eq!(
            payment_uri("me@bank", Some("50")),
            "upi://pay?pa=me%40bank&pn=Payee&am=50&cu=INR"
        );
    }

    #[test]
    fn test_empty_amount_is_omitted() {
        assert_eq!(payment_uri("me@bank", Some("")), "upi://pay?pa=me%40bank&pn=Payee&cu=INR");
        assert_eq!(payment_uri("me@bank", None), "upi://pay?pa=me%40bank&pn=Payee&cu=INR");
    }

    #[test]
    fn test_amount_is_not_validated() {
        // Whatever the user typed is embedded, escaped but otherwise untouched.
        assert_eq!(
            payment_uri("a@b", Some("-1 e3")),
            "upi://pay?pa=a%40b&pn=Payee&am=-1+e3&cu=INR"
        );
    }
}
