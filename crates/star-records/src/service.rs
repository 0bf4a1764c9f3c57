//! Fixed service price lists

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServicePrice {
    pub name: &'static str,
    pub price: f64,
}

impl ServicePrice {
    pub(crate) const fn new(name: &'static str, price: f64) -> Self {
        Self { name, price }
    }
}

/// Exact, case-sensitive lookup by service name.
pub fn find_service<'a>(list: &'a [ServicePrice], name: &str) -> Option<&'a ServicePrice> {
    list.iter().find(|service| service.name == name)
}
