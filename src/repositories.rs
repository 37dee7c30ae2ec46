pub mod referrals;
pub mod transactions;
pub mod upi;
pub mod users;
pub mod wallets;
pub mod withdrawals;
