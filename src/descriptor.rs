use crate::key::{f32_bits, KeyHasher, PoolKey};
use alloc::string::String;

/// A value describing the shape of a resource to pull or allocate.
///
/// Descriptors are only consulted to derive pool keys and to decide whether an
/// idle resource can stand in for a requested one. Implementations must keep
/// the two consistent: compatible descriptors must produce the same key.
pub trait Descriptor: Clone {
    /// Derives the pool key from the salient fields.
    fn pool_key(&self) -> PoolKey;

    /// Returns true if a resource allocated for `other` is interchangeable with
    /// one allocated for `self`.
    fn is_compatible(&self, other: &Self) -> bool;
}

/// Usage class of a buffer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BufferKind {
    #[default]
    /// General purpose structured data.
    Default = 0,
    /// Byte-addressed.
    Raw = 1,
    /// Append/consume stack.
    Append = 2,
    /// Structured with a hidden counter.
    Counter = 3,
    /// Uniform block.
    Constant = 4,
    /// Explicit structured buffer.
    Structured = 5,
    /// Draw or dispatch arguments.
    IndirectArguments = 6,
}

/// Shape of a buffer: element count, element stride and usage class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferDescriptor {
    /// Number of elements.
    pub count: u32,
    /// Size of one element in bytes.
    pub stride: u32,
    /// Usage class.
    pub kind: BufferKind,
    /// Debug name. Not part of the key.
    pub name: String,
}

impl BufferDescriptor {
    /// Describes a [`BufferKind::Default`] buffer.
    pub fn new(count: u32, stride: u32) -> Self {
        Self::with_kind(count, stride, BufferKind::Default)
    }

    /// Describes a buffer of the given usage class.
    pub fn with_kind(count: u32, stride: u32, kind: BufferKind) -> Self {
        BufferDescriptor {
            count,
            stride,
            kind,
            name: String::new(),
        }
    }

    /// Sets the debug name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Size of the buffer in bytes.
    pub fn size_in_bytes(&self) -> u64 {
        self.count as u64 * self.stride as u64
    }
}

impl Descriptor for BufferDescriptor {
    fn pool_key(&self) -> PoolKey {
        KeyHasher::new()
            .add(self.count as u64)
            .add(self.stride as u64)
            .add(self.kind as u64)
            .finish()
    }

    fn is_compatible(&self, other: &Self) -> bool {
        self.count == other.count && self.stride == other.stride && self.kind == other.kind
    }
}

/// Bits of the depth attachment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DepthBits {
    /// No depth attachment.
    #[default]
    None = 0,
    /// 8-bit depth.
    Depth8 = 8,
    /// 16-bit depth.
    Depth16 = 16,
    /// 24-bit depth.
    Depth24 = 24,
    /// 32-bit depth.
    Depth32 = 32,
}

/// Multisample count.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MsaaSamples {
    /// Single sample.
    #[default]
    None = 1,
    /// Two samples.
    X2 = 2,
    /// Four samples.
    X4 = 4,
    /// Eight samples.
    X8 = 8,
}

/// Sampler filter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FilterMode {
    /// Nearest texel.
    #[default]
    Point = 0,
    /// Linear within a mip level.
    Bilinear = 1,
    /// Linear across mip levels.
    Trilinear = 2,
}

/// Sampler addressing mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum WrapMode {
    #[default]
    /// Tile the texture.
    Repeat = 0,
    /// Clamp to the edge texel.
    Clamp = 1,
    /// Tile with every other copy mirrored.
    Mirror = 2,
    /// Mirror once, then clamp.
    MirrorOnce = 3,
}

/// Texture dimensionality.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TextureDimension {
    /// One-dimensional.
    Tex1D = 1,
    #[default]
    /// Two-dimensional.
    Tex2D = 2,
    /// Volume texture; `slices` is the depth.
    Tex3D = 3,
    /// Cube map.
    Cube = 4,
    /// Array of 2D layers; `slices` is the layer count.
    Tex2DArray = 5,
    /// Array of cube maps.
    CubeArray = 6,
}

/// Opaque pixel format identifier, forwarded to the device untouched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureFormat(pub u32);

/// Shape of a texture.
///
/// `name`, `enable_msaa`, `clear_buffer` and `clear_color` describe how the
/// texture is used rather than what it is, and take no part in the key.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDescriptor {
    /// Debug name.
    pub name: String,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Depth or array layer count.
    pub slices: u32,
    /// Depth attachment precision.
    pub depth_bits: DepthBits,
    /// Pixel format.
    pub format: TextureFormat,
    /// Sampler filter.
    pub filter_mode: FilterMode,
    /// Sampler addressing.
    pub wrap_mode: WrapMode,
    /// Dimensionality.
    pub dimension: TextureDimension,
    /// Unordered access from shaders.
    pub enable_random_write: bool,
    /// Allocate a mip chain.
    pub use_mip_map: bool,
    /// Regenerate mips after rendering.
    pub auto_generate_mips: bool,
    /// Comparison-sampled depth.
    pub is_shadow_map: bool,
    /// Anisotropic filtering level.
    pub aniso_level: u32,
    /// Mip selection bias.
    pub mip_map_bias: f32,
    /// Render with multisampling.
    pub enable_msaa: bool,
    /// Bind the multisampled surface instead of the resolved one.
    pub bind_texture_ms: bool,
    /// Sample count.
    pub msaa_samples: MsaaSamples,
    /// Clear on first bind.
    pub clear_buffer: bool,
    /// Linear RGBA clear color.
    pub clear_color: [f32; 4],
}

impl TextureDescriptor {
    /// Describes a single-slice 2D color texture with point filtering, repeat
    /// wrapping and no depth or multisampling.
    pub fn new(width: u32, height: u32) -> Self {
        TextureDescriptor {
            name: String::new(),
            width,
            height,
            slices: 1,
            depth_bits: DepthBits::None,
            format: TextureFormat::default(),
            filter_mode: FilterMode::Point,
            wrap_mode: WrapMode::Repeat,
            dimension: TextureDimension::Tex2D,
            enable_random_write: false,
            use_mip_map: false,
            auto_generate_mips: false,
            is_shadow_map: false,
            aniso_level: 0,
            mip_map_bias: 0.0,
            enable_msaa: false,
            bind_texture_ms: false,
            msaa_samples: MsaaSamples::None,
            clear_buffer: false,
            clear_color: [0.0; 4],
        }
    }

    /// Sets the debug name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the pixel format.
    pub fn with_format(mut self, format: TextureFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the depth attachment precision.
    pub fn with_depth_bits(mut self, depth_bits: DepthBits) -> Self {
        self.depth_bits = depth_bits;
        self
    }

    /// Sets the sample count and enables MSAA when it is above one.
    pub fn with_msaa(mut self, samples: MsaaSamples) -> Self {
        self.msaa_samples = samples;
        self.enable_msaa = samples != MsaaSamples::None;
        self
    }

    /// Sets the dimensionality and slice count.
    pub fn with_dimension(mut self, dimension: TextureDimension, slices: u32) -> Self {
        self.dimension = dimension;
        self.slices = slices;
        self
    }

    /// Sets the sampler filter and addressing.
    pub fn with_sampler(mut self, filter_mode: FilterMode, wrap_mode: WrapMode) -> Self {
        self.filter_mode = filter_mode;
        self.wrap_mode = wrap_mode;
        self
    }

    /// Requests a mip chain, optionally regenerated automatically.
    pub fn with_mip_maps(mut self, auto_generate: bool) -> Self {
        self.use_mip_map = true;
        self.auto_generate_mips = auto_generate;
        self
    }

    /// Enables or disables unordered shader writes.
    pub fn with_random_write(mut self, enable: bool) -> Self {
        self.enable_random_write = enable;
        self
    }
}

impl Descriptor for TextureDescriptor {
    fn pool_key(&self) -> PoolKey {
        KeyHasher::new()
            .add(self.width as u64)
            .add(self.height as u64)
            .add(self.slices as u64)
            .add_f32(self.mip_map_bias)
            .add(self.depth_bits as u64)
            .add(self.format.0 as u64)
            .add(self.filter_mode as u64)
            .add(self.wrap_mode as u64)
            .add(self.dimension as u64)
            .add(self.aniso_level as u64)
            .add(self.msaa_samples as u64)
            .add_flag(self.enable_random_write)
            .add_flag(self.use_mip_map)
            .add_flag(self.auto_generate_mips)
            .add_flag(self.is_shadow_map)
            .add_flag(self.bind_texture_ms)
            .finish()
    }

    fn is_compatible(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.slices == other.slices
            && f32_bits(self.mip_map_bias) == f32_bits(other.mip_map_bias)
            && self.depth_bits == other.depth_bits
            && self.format == other.format
            && self.filter_mode == other.filter_mode
            && self.wrap_mode == other.wrap_mode
            && self.dimension == other.dimension
            && self.aniso_level == other.aniso_level
            && self.msaa_samples == other.msaa_samples
            && self.enable_random_write == other.enable_random_write
            && self.use_mip_map == other.use_mip_map
            && self.auto_generate_mips == other.auto_generate_mips
            && self.is_shadow_map == other.is_shadow_map
            && self.bind_texture_ms == other.bind_texture_ms
    }
}
