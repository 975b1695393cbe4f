pub mod ds1307_api;
