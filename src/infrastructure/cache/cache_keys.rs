pub fn global_balances_key() -> String {
    "balances:global".to_string()
}

pub fn group_balances_key(group_id: &str) -> String {
    format!("balances:group:{}", group_id)
}
