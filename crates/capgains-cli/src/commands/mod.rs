pub mod capital_gains;
