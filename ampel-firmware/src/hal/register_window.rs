// Register Window - gemappter Blick auf den GPIO-Registerblock
//
// Kapselt /dev/mem + mmap() hinter einem Besitz-Handle. Volatile Zugriffe
// und Offset-Prüfung passieren nur hier, nicht an jeder Aufrufstelle.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::ptr::{self, NonNull};

use ampel_core::{GpioRegisters, Register};
use log::{debug, error, info};

use crate::config::{GPIO_BASE, GPIO_BLOCK_SIZE, GPIO_DEVICE_PATH};

/// Kleinstes Fenster, das alle Register aus [`Register`] enthält
///
/// GPCLR0 hat den höchsten Offset.
pub const MIN_WINDOW_SIZE: usize = (Register::Clear0.offset() + 1) * size_of::<u32>();

/// Fehler beim Öffnen des Register-Fensters
///
/// Beide Fehler sind beim Start fatal, jeder hat seinen eigenen Exit-Code.
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("unable to open {}: {source} (are you root?)", .path.display())]
    DeviceOpen { path: PathBuf, source: io::Error },

    #[error("unable to map {len} bytes at {base:#x} from {}: {source}", .path.display())]
    Mapping {
        path: PathBuf,
        base: u64,
        len: usize,
        source: io::Error,
    },
}

impl WindowError {
    /// Prozess-Exit-Code der fehlgeschlagenen Stufe
    pub fn exit_code(&self) -> u8 {
        match self {
            WindowError::DeviceOpen { .. } => 1,
            WindowError::Mapping { .. } => 2,
        }
    }
}

/// Gemappter GPIO-Registerblock
///
/// Besitzt Mapping und File-Descriptor. Beim Drop wird erst `munmap()`
/// aufgerufen, danach schließt `File` den Descriptor.
#[derive(Debug)]
pub struct RegisterWindow {
    base: NonNull<u32>,
    len: usize,
    phys_base: u64,
    _device: File,
}

impl RegisterWindow {
    /// Öffnet `/dev/mem` und mappt den GPIO-Block des Raspberry Pi 4
    pub fn open() -> Result<Self, WindowError> {
        Self::open_at(Path::new(GPIO_DEVICE_PATH), GPIO_BASE, GPIO_BLOCK_SIZE)
    }

    /// Öffnet `path` (read/write, O_SYNC, O_CLOEXEC) und mappt `len` Bytes ab `base`
    ///
    /// `len` unter [`MIN_WINDOW_SIZE`] ist ein `Mapping`-Fehler (`EINVAL`).
    /// Schlägt das Mapping fehl, wird das bereits geöffnete Gerät genau
    /// einmal geschlossen (Drop von `File`), bevor der Fehler zurückkommt.
    pub fn open_at(path: &Path, base: u64, len: usize) -> Result<Self, WindowError> {
        info!("Opening {}", path.display());
        let device = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC | libc::O_CLOEXEC)
            .open(path)
            .map_err(|source| WindowError::DeviceOpen {
                path: path.to_path_buf(),
                source,
            })?;
        info!("{} opened as fd {}", path.display(), device.as_raw_fd());

        let mapping_error = |source: io::Error| WindowError::Mapping {
            path: path.to_path_buf(),
            base,
            len,
            source,
        };

        if len < MIN_WINDOW_SIZE {
            return Err(mapping_error(io::Error::from_raw_os_error(libc::EINVAL)));
        }

        let addr = map_shared(&device, len, base).map_err(mapping_error)?;

        let base_ptr = NonNull::new(addr.cast::<u32>())
            .ok_or_else(|| mapping_error(io::Error::from_raw_os_error(libc::EFAULT)))?;
        info!("Mapped {} bytes at {:#x} from {}", len, base, path.display());

        Ok(Self {
            base: base_ptr,
            len,
            phys_base: base,
            _device: device,
        })
    }

    /// Basisadresse des Mappings im Prozess
    pub fn as_ptr(&self) -> *mut u32 {
        self.base.as_ptr()
    }

    /// Physische Adresse, an der das Fenster beginnt
    pub fn phys_base(&self) -> u64 {
        self.phys_base
    }

    /// Größe in Bytes
    pub fn size(&self) -> usize {
        self.len
    }

    fn word(&self, register: Register) -> *mut u32 {
        let offset = register.offset();
        assert!(
            offset < self.len / size_of::<u32>(),
            "register {register} outside mapped window"
        );
        // SAFETY: offset liegt innerhalb des Mappings (siehe assert)
        unsafe { self.base.as_ptr().add(offset) }
    }
}

/// Dateioffset für mmap()
///
/// Auf glibc immer 64 Bit (`mmap64`), damit `0xFE200000` auch mit 32-Bit
/// `off_t` (armhf) passt.
#[cfg(all(target_os = "linux", target_env = "gnu"))]
type FileOffset = libc::off64_t;
#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
type FileOffset = libc::off_t;

fn file_offset(base: u64) -> io::Result<FileOffset> {
    FileOffset::try_from(base).map_err(|_| io::Error::from_raw_os_error(libc::EOVERFLOW))
}

/// `mmap()` mit `PROT_READ | PROT_WRITE` und `MAP_SHARED` an einer vom Kernel gewählten Adresse
fn map_shared(device: &File, len: usize, base: u64) -> io::Result<*mut libc::c_void> {
    let offset = file_offset(base)?;

    // SAFETY: neues Mapping, der Descriptor ist gültig, solange `device` lebt
    let addr = unsafe {
        #[cfg(all(target_os = "linux", target_env = "gnu"))]
        let map = libc::mmap64;
        #[cfg(not(all(target_os = "linux", target_env = "gnu")))]
        let map = libc::mmap;

        map(
            ptr::null_mut(),
            len,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_SHARED,
            device.as_raw_fd(),
            offset,
        )
    };
    if addr == libc::MAP_FAILED {
        return Err(io::Error::last_os_error());
    }
    Ok(addr)
}

impl GpioRegisters for RegisterWindow {
    fn read(&self, register: Register) -> u32 {
        // SAFETY: ausgerichteter Zeiger in das lebende Mapping
        unsafe { ptr::read_volatile(self.word(register)) }
    }

    fn write(&mut self, register: Register, value: u32) {
        // SAFETY: ausgerichteter Zeiger in das lebende Mapping; volatile,
        // damit kein Schreibzugriff wegoptimiert oder zusammengelegt wird
        unsafe { ptr::write_volatile(self.word(register), value) }
    }
}

impl Drop for RegisterWindow {
    fn drop(&mut self) {
        // SAFETY: Adresse und Länge stammen aus dem erfolgreichen mmap()
        let rc = unsafe { libc::munmap(self.base.as_ptr().cast(), self.len) };
        if rc != 0 {
            error!("munmap failed: {}", io::Error::last_os_error());
        } else {
            debug!("Unmapped {} bytes at {:#x}", self.len, self.phys_base);
        }
    }
}

// ============================================================================
// Tests (Datei statt /dev/mem)
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Seek, SeekFrom};
    use std::sync::{Mutex, MutexGuard};

    // Tests, die Dateien öffnen, laufen nacheinander (fd-Zählung)
    static FILES: Mutex<()> = Mutex::new(());

    fn serial() -> MutexGuard<'static, ()> {
        FILES.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn open_fds() -> usize {
        std::fs::read_dir("/proc/self/fd").unwrap().count()
    }

    fn backing_file() -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        file.as_file().set_len(GPIO_BLOCK_SIZE as u64).unwrap();
        file
    }

    fn word_at(file: &tempfile::NamedTempFile, register: Register) -> u32 {
        let mut f = file.reopen().unwrap();
        let mut buf = [0u8; 4];
        f.seek(SeekFrom::Start((register.offset() * 4) as u64)).unwrap();
        f.read_exact(&mut buf).unwrap();
        u32::from_ne_bytes(buf)
    }

    #[test]
    fn test_open_missing_device_is_device_open_error() {
        let _files = serial();
        let dir = tempfile::tempdir().unwrap();
        let err = RegisterWindow::open_at(&dir.path().join("mem"), 0, GPIO_BLOCK_SIZE)
            .unwrap_err();
        assert!(matches!(err, WindowError::DeviceOpen { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_unaligned_base_is_mapping_error() {
        let _files = serial();
        let file = backing_file();
        let err = RegisterWindow::open_at(file.path(), 1, GPIO_BLOCK_SIZE).unwrap_err();
        match &err {
            WindowError::Mapping { base, len, source, .. } => {
                assert_eq!(*base, 1);
                assert_eq!(*len, GPIO_BLOCK_SIZE);
                assert_eq!(source.raw_os_error(), Some(libc::EINVAL));
            }
            other => panic!("expected Mapping, got {other:?}"),
        }
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_write_is_visible_in_shared_mapping() {
        let _files = serial();
        let file = backing_file();
        let mut window = RegisterWindow::open_at(file.path(), 0, GPIO_BLOCK_SIZE).unwrap();

        window.write(Register::Set0, 1 << 10);
        window.write(Register::FunctionSelect1, 0b001_000_001_001);

        assert_eq!(window.read(Register::Set0), 1 << 10);
        assert_eq!(window.read(Register::Clear0), 0);
        assert_eq!(word_at(&file, Register::Set0), 1 << 10);
        assert_eq!(word_at(&file, Register::FunctionSelect1), 0b001_000_001_001);
    }

    #[test]
    fn test_repeated_write_same_state() {
        let _files = serial();
        let file = backing_file();
        let mut window = RegisterWindow::open_at(file.path(), 0, GPIO_BLOCK_SIZE).unwrap();

        window.write(Register::Clear0, 0xA5A5);
        let once = window.read(Register::Clear0);
        window.write(Register::Clear0, 0xA5A5);
        assert_eq!(window.read(Register::Clear0), once);
    }

    #[test]
    fn test_window_accessors() {
        let _files = serial();
        let file = backing_file();
        let window = RegisterWindow::open_at(file.path(), 0, GPIO_BLOCK_SIZE).unwrap();
        assert_eq!(window.size(), GPIO_BLOCK_SIZE);
        assert_eq!(window.phys_base(), 0);
        assert!(!window.as_ptr().is_null());
    }

    #[test]
    fn test_drop_unmaps_and_closes() {
        let _files = serial();
        let file = backing_file();
        let window = RegisterWindow::open_at(file.path(), 0, GPIO_BLOCK_SIZE).unwrap();
        drop(window);
        // Nach dem Drop lässt sich die Datei erneut mappen
        let window = RegisterWindow::open_at(file.path(), 0, GPIO_BLOCK_SIZE).unwrap();
        assert_eq!(window.read(Register::Set0), 0);
    }

    #[test]
    fn test_failed_mapping_closes_device() {
        let _files = serial();
        let file = backing_file();
        let before = open_fds();
        for _ in 0..50 {
            let err = RegisterWindow::open_at(file.path(), 1, GPIO_BLOCK_SIZE).unwrap_err();
            assert_eq!(err.exit_code(), 2);
        }
        assert_eq!(open_fds(), before);
    }

    #[test]
    fn test_window_smaller_than_clear_register_is_mapping_error() {
        let _files = serial();
        let file = backing_file();
        let before = open_fds();
        let err = RegisterWindow::open_at(file.path(), 0, 40).unwrap_err();
        match &err {
            WindowError::Mapping { len, source, .. } => {
                assert_eq!(*len, 40);
                assert_eq!(source.raw_os_error(), Some(libc::EINVAL));
            }
            other => panic!("expected Mapping, got {other:?}"),
        }
        assert_eq!(err.exit_code(), 2);
        assert_eq!(open_fds(), before);

        let window = RegisterWindow::open_at(file.path(), 0, MIN_WINDOW_SIZE).unwrap();
        assert_eq!(window.read(Register::Clear0), 0);
    }

    #[test]
    fn test_gpio_base_fits_file_offset() {
        assert_eq!(MIN_WINDOW_SIZE, 44);
        let offset = file_offset(GPIO_BASE).unwrap();
        assert_eq!(u64::try_from(offset).unwrap(), GPIO_BASE);
    }
}
