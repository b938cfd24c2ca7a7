pub mod committed;
