/// Byte-oriented transport a slave reads requests from and writes replies to
///
/// The slave only ever calls these methods from inside [`crate::server::RtuSlave::poll`],
/// one request at a time. A read that times out should simply return fewer bytes.
pub trait PhysLayer {
    /// Number of bytes that can be read without waiting
    fn bytes_available(&mut self) -> std::io::Result<usize>;

    /// Read as many bytes of a single frame as arrive before the transport's read timeout,
    /// returning the count placed in `buffer`
    fn read(&mut self, buffer: &mut [u8]) -> std::io::Result<usize>;

    /// Write all of `data` in order
    fn write(&mut self, data: &[u8]) -> std::io::Result<()>;

    /// Throw away anything still waiting in the input buffer
    fn discard_input(&mut self) -> std::io::Result<()>;
}

impl<T> PhysLayer for &mut T
where
    T: PhysLayer + ?Sized,
{
    fn bytes_available(&mut self) -> std::io::Result<usize> {
        (**self).bytes_available()
    }

    fn read(&mut self, buffer: &mut [u8]) -> std::io::Result<usize> {
        (**self).read(buffer)
    }

    fn write(&mut self, data: &[u8]) -> std::io::Result<()> {
        (**self).write(data)
    }

    fn discard_input(&mut self) -> std::io::Result<()> {
        (**self).discard_input()
    }
}
