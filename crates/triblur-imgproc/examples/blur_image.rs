use argh::FromArgs;

use triblur_image::{ImageSize, PixelBuffer};
use triblur_imgproc::filter::gaussian_blur;

#[derive(FromArgs)]
/// Blur an image with a three-pass box approximation of a gaussian
struct Args {
    /// the blur strength (gaussian standard deviation)
    #[argh(option, default = "3.0")]
    sigma: f32,

    /// write the blurred image to this path
    #[argh(option, default = "String::from(\"blurred.png\")")]
    output: String,

    /// path to the input image
    #[argh(positional)]
    input: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let input = image::open(&args.input)?.to_rgba8();
    let (width, height) = input.dimensions();
    let size = ImageSize {
        width: width as usize,
        height: height as usize,
    };

    let src = PixelBuffer::from_vec(size, input.into_raw())?;
    let mut dst = PixelBuffer::new(size);

    log::info!("blurring {} with sigma {}", size, args.sigma);
    gaussian_blur(&src, &mut dst, args.sigma)?;

    let output = image::RgbaImage::from_raw(width, height, dst.into_vec())
        .ok_or("failed to assemble the output image")?;
    output.save(&args.output)?;

    log::info!("wrote {}", args.output);

    Ok(())
}
