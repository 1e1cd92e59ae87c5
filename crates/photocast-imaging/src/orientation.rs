//! EXIF orientation normalisation
//!
//! | code | stored as                     | fix              |
//! |------|-------------------------------|------------------|
//! | 1    | upright                       | none             |
//! | 2    | mirrored                      | flip horizontal  |
//! | 3    | upside down                   | rotate 180       |
//! | 4    | mirrored upside down          | flip vertical    |
//! | 5    | mirrored, rotated 90 CCW      | transpose        |
//! | 6    | rotated 90 CCW                | rotate 90 CW     |
//! | 7    | mirrored, rotated 90 CW       | transverse       |
//! | 8    | rotated 90 CW                 | rotate 270 CW    |

use image::DynamicImage;

/// Returns the upright image. Unknown codes leave the image as is.
pub fn apply(img: DynamicImage, code: u16) -> DynamicImage {
    match code {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}
