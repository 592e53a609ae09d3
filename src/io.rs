//! Reading and writing fields on disk.
//!
//! Only FITS images are supported. Fields on separated grids become 2D images,
//! anything else is written as a 1D array in grid point order. A path ending
//! in `.gz` is gzip-compressed on write; compressed files are recognised by
//! their magic bytes on read.
use crate::error::{OpticsError, Result};
use crate::field::Field;
use crate::grid::Grid;
use crate::linalg::Matrix;
use fitrs::{Fits, FitsData, Hdu, HeaderValue};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

const CARD_LEN: usize = 80;
const BLOCK_LEN: usize = 36 * CARD_LEN;
const END_CARD: [u8; CARD_LEN] = {
    let mut card = [b' '; CARD_LEN];
    card[0] = b'E';
    card[1] = b'N';
    card[2] = b'D';
    card
};

/// On-disk formats recognised from a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.fits` or `.fits.gz`
    Fits,
    /// `.asdf`; recognised but neither read nor written.
    Asdf,
}

impl FileFormat {
    /// Guess the format from the file extension.
    pub fn guess(path: &Path) -> Result<Self> {
        let name = path.to_string_lossy();
        if name.ends_with("asdf") {
            Ok(Self::Asdf)
        } else if name.ends_with("fits") || name.ends_with("fits.gz") {
            Ok(Self::Fits)
        } else {
            Err(OpticsError::UnknownFormat(name.into_owned()))
        }
    }

    fn resolve(format: Option<Self>, path: &Path) -> Result<Self> {
        match format {
            Some(format) => Ok(format),
            None => Self::guess(path),
        }
    }
}

/// Primary image of a FITS file.
#[derive(Debug, Clone, PartialEq)]
pub struct FitsImage {
    /// Axis lengths in NAXIS order, fastest axis first.
    pub shape: Vec<usize>,
    pub data: Vec<f64>,
}

/// Write `field` to `path`, replacing any existing file.
///
/// With `format` set to `None` the format is guessed from the extension.
pub fn write_field(field: &Field<f64>, path: impl AsRef<Path>, format: Option<FileFormat>) -> Result<()> {
    let path = path.as_ref();
    match FileFormat::resolve(format, path)? {
        FileFormat::Fits => write_fits(field, path),
        FileFormat::Asdf => Err(OpticsError::UnsupportedFormat("asdf".into())),
    }
}

/// Read a field stored at `path` and attach it to `grid`.
///
/// The number of stored samples must equal `grid.size()`. A 2D image read
/// onto a separated grid must also have the grid's shape.
pub fn read_field(path: impl AsRef<Path>, grid: &Arc<Grid>, format: Option<FileFormat>) -> Result<Field<f64>> {
    let path = path.as_ref();
    match FileFormat::resolve(format, path)? {
        FileFormat::Fits => {
            let image = read_fits(path)?;
            if let (Ok([rows, cols]), [ncols, nrows]) = (grid.shape(), image.shape.as_slice()) {
                if (*nrows, *ncols) != (rows, cols) {
                    return Err(OpticsError::InvalidArgument(format!(
                        "image of shape {:?} does not fit a {rows}x{cols} grid", image.shape
                    )));
                }
            }
            Field::new(image.data, Arc::clone(grid))
        }
        FileFormat::Asdf => Err(OpticsError::UnsupportedFormat("asdf".into())),
    }
}

/// Read the primary image of a (possibly gzip-compressed) FITS file.
pub fn read_fits(path: impl AsRef<Path>) -> Result<FitsImage> {
    let path = path.as_ref();
    let mut lead = Vec::with_capacity(6);
    File::open(path)?.take(6).read_to_end(&mut lead)?;
    if lead.starts_with(&GZIP_MAGIC) {
        let mut staged = NamedTempFile::new()?;
        let mut decoder = GzDecoder::new(BufReader::new(File::open(path)?));
        io::copy(&mut decoder, staged.as_file_mut())?;
        staged.as_file_mut().flush()?;
        read_primary(staged.path(), path)
    } else if lead.starts_with(b"SIMPLE") {
        read_primary(path, path)
    } else {
        Err(OpticsError::MalformedFile(format!("{} is not a FITS file", path.display())))
    }
}

/// `plain` holds uncompressed FITS; `origin` names the file for errors.
fn read_primary(plain: &Path, origin: &Path) -> Result<FitsImage> {
    let malformed = |what: &str| OpticsError::MalformedFile(format!("{}: {what}", origin.display()));

    let fits = Fits::open(plain)?;
    let hdu = fits.get(0).ok_or_else(|| malformed("no primary HDU"))?;
    match hdu.value("NAXIS") {
        Some(HeaderValue::IntegerNumber(naxis)) if *naxis >= 1 => {}
        _ => return Err(malformed("primary HDU holds no image")),
    }
    match hdu.value("BITPIX") {
        Some(HeaderValue::IntegerNumber(16 | 32 | -32 | -64)) => {}
        other => return Err(malformed(&format!("unsupported BITPIX {other:?}"))),
    }

    let (shape, data) = match hdu.read_data() {
        FitsData::FloatingPoint64(array) => (array.shape, array.data),
        FitsData::FloatingPoint32(array) => {
            (array.shape, array.data.into_iter().map(f64::from).collect())
        }
        // blank pixels become NaN
        FitsData::IntegersI32(array) => {
            (array.shape, array.data.into_iter().map(|v| v.map_or(f64::NAN, f64::from)).collect())
        }
        FitsData::IntegersU32(array) => {
            (array.shape, array.data.into_iter().map(|v| v.map_or(f64::NAN, f64::from)).collect())
        }
        FitsData::Characters(_) => return Err(malformed("character data")),
    };
    tracing::debug!(path = %origin.display(), ?shape, "read fits image");
    Ok(FitsImage { shape, data })
}

/// Header cards holding reals, as (keyword, value).
///
/// fitrs prints reals by repeatedly scaling by ten, which never terminates
/// for zero and overflows the card for most non-decimal fractions. These
/// cards are inserted as integer placeholders and their value columns are
/// rewritten once the file exists.
type RealCards = Vec<(&'static str, f64)>;

/// Value columns 11 to 30 of a card, right-justified.
fn real_card_value(value: f64) -> String {
    format!("{:>20}", format!("{value:.12E}"))
}

fn image_hdu(field: &Field<f64>) -> (Hdu, RealCards) {
    let mut hdu = match field.shaped() {
        // NAXIS order, fastest axis first
        Ok(shaped) => Hdu::new(&[shaped.ncols(), shaped.nrows()], shaped.flattened_array()),
        Err(_) => Hdu::new(&[field.len()], field.values().to_vec()),
    };
    let creator = format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    let date = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string();
    hdu.insert("CREATOR", creator.as_str());
    hdu.insert("DATE", date.as_str());
    hdu.insert("FILETYPE", "field");

    let mut reals = RealCards::new();
    let grid = field.grid();
    if let (Ok(delta), Ok(zero)) = (grid.delta(), grid.zero()) {
        hdu.insert("CRPIX1", 1);
        hdu.insert("CRPIX2", 1);
        reals.extend([
            ("CDELT1", delta[0]),
            ("CDELT2", delta[1]),
            ("CRVAL1", zero[0]),
            ("CRVAL2", zero[1]),
        ]);
        reals.retain(|(key, value)| {
            if !value.is_finite() {
                tracing::warn!(key, value, "non-finite header value skipped");
            }
            value.is_finite()
        });
        for (key, _) in &reals {
            hdu.insert(*key, 0);
        }
        hdu.insert("CTYPE1", "X");
        hdu.insert("CTYPE2", "Y");
    }
    (hdu, reals)
}

/// Rewrite the value columns of the `reals` cards in the primary header.
fn patch_real_cards(path: &Path, reals: &RealCards) -> Result<()> {
    if reals.is_empty() {
        return Ok(());
    }
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    let mut header = Vec::new();
    let mut block = vec![0u8; BLOCK_LEN];
    loop {
        file.read_exact(&mut block)?;
        header.extend_from_slice(&block);
        if block.chunks(CARD_LEN).any(|card| card == END_CARD.as_slice()) {
            break;
        }
    }
    for card in header.chunks_mut(CARD_LEN) {
        let keyword = String::from_utf8_lossy(&card[..8]).trim_end().to_owned();
        if let Some((_, value)) = reals.iter().find(|(key, _)| *key == keyword) {
            card[10..30].copy_from_slice(real_card_value(*value).as_bytes());
        }
    }
    file.seek(SeekFrom::Start(0))?;
    file.write_all(&header)?;
    Ok(())
}

fn write_fits(field: &Field<f64>, path: &Path) -> Result<()> {
    let (hdu, reals) = image_hdu(field);
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    let compressed = path.extension().is_some_and(|ext| ext == "gz");
    if compressed {
        // fitrs writes straight to a path, so stage the plain file first
        let staged = NamedTempFile::new()?;
        Fits::create(staged.path(), hdu)?;
        patch_real_cards(staged.path(), &reals)?;
        let mut plain = File::open(staged.path())?;
        let mut encoder = GzEncoder::new(BufWriter::new(File::create(path)?), Compression::default());
        io::copy(&mut plain, &mut encoder)?;
        encoder.finish()?.flush()?;
    } else {
        Fits::create(path, hdu)?;
        patch_real_cards(path, &reals)?;
    }
    tracing::info!(path = %path.display(), samples = field.len(), compressed, "wrote field");
    Ok(())
}
