//! Raw/parsed split shared by bus-borrowing drivers.
//! `read_raw` performs the bus traffic, `parse` is pure and testable without hardware.
//! The bus is a trait parameter so a driver struct need not be generic over it.

pub trait SensorDriver<Bus> {
    type RawData;
    type ParsedData;
    type Error;

    fn read_raw(&mut self, bus: &mut Bus) -> Result<Self::RawData, Self::Error>;
    fn parse(&self, raw: Self::RawData) -> Result<Self::ParsedData, Self::Error>;

    /// One bus read followed by decoding. Nothing is returned if either step fails.
    fn read(&mut self, bus: &mut Bus) -> Result<Self::ParsedData, Self::Error> {
        let raw = self.read_raw(bus)?;
        <Self as SensorDriver<Bus>>::parse(self, raw)
    }
}
