pub mod bcd;
pub mod ds1307;
pub mod sensor_trait;
