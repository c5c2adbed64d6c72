//! Element-type dispatch for copying datasets and attributes between HDF5 files.

use hdf5::{
    types::{
        FloatSize,
        IntSize,
        TypeDescriptor,
        VarLenAscii,
        VarLenUnicode,
    },
    Attribute,
    Container,
    Dataset,
    Group,
    H5Type,
    Location,
};
use shared::{
    bail,
    ndarray as nd,
    Context,
    Result,
};


/// Calls `$func::<T>($args)` with `T` the Rust type of the HDF5 element type `$desc`.
macro_rules! dispatch_element_type {
    ($desc:expr, $path:expr, $func:ident ( $($args:expr),* )) => {
        match $desc {
            TypeDescriptor::Float(FloatSize::U4)    => $func::<f32>($($args),*),
            TypeDescriptor::Float(FloatSize::U8)    => $func::<f64>($($args),*),
            TypeDescriptor::Integer(IntSize::U1)    => $func::<i8>($($args),*),
            TypeDescriptor::Integer(IntSize::U2)    => $func::<i16>($($args),*),
            TypeDescriptor::Integer(IntSize::U4)    => $func::<i32>($($args),*),
            TypeDescriptor::Integer(IntSize::U8)    => $func::<i64>($($args),*),
            TypeDescriptor::Unsigned(IntSize::U1)   => $func::<u8>($($args),*),
            TypeDescriptor::Unsigned(IntSize::U2)   => $func::<u16>($($args),*),
            TypeDescriptor::Unsigned(IntSize::U4)   => $func::<u32>($($args),*),
            TypeDescriptor::Unsigned(IntSize::U8)   => $func::<u64>($($args),*),
            TypeDescriptor::Boolean                 => $func::<bool>($($args),*),
            TypeDescriptor::VarLenAscii             => $func::<VarLenAscii>($($args),*),
            TypeDescriptor::VarLenUnicode           => $func::<VarLenUnicode>($($args),*),
            other => bail!("Unsupported element type {:?} of {:?}.", other, $path),
        }
    };
}


fn element_type(c: &Container, path: &str) -> Result<TypeDescriptor> {
    c.dtype()
        .and_then(|t| t.to_descriptor())
        .with_context(|| format!("Failed to read element type of {:?}.", path))
}


fn scalar_of<T: Clone>(data: &nd::ArrayD<T>, path: &str) -> Result<T> {
    data.iter().next()
        .cloned()
        .with_context(|| format!("Scalar {:?} holds no value.", path))
}


fn copy_dataset_as<T>(src: &Dataset, dst: &Group, name: &str, path: &str) -> Result<()>
where T: H5Type + Clone {
    let data = src.read_dyn::<T>()
        .with_context(|| format!("Failed to read dataset {:?}.", path))?;

    if data.ndim() == 0 {
        let value = scalar_of(&data, path)?;
        dst.new_dataset::<T>().create(name)?.write_scalar(&value)?;
    } else {
        dst.new_dataset_builder().with_data(&data).create(name)?;
    }
    Ok(())
}


fn copy_attr_as<T>(src: &Attribute, dst: &Location, name: &str, path: &str) -> Result<()>
where T: H5Type + Clone {
    let data = src.read_dyn::<T>()
        .with_context(|| format!("Failed to read attribute {:?}.", path))?;

    if data.ndim() == 0 {
        let value = scalar_of(&data, path)?;
        dst.new_attr::<T>().create(name)?.write_scalar(&value)?;
    } else {
        dst.new_attr_builder().with_data(&data).create(name)?;
    }
    Ok(())
}


/// Copies dataset `src` into `dst` under `name`, along with its attributes. `path` is the full path
/// of `src`, for messages only.
pub fn copy_dataset(src: &Dataset, dst: &Group, name: &str, path: &str) -> Result<()> {
    let desc = element_type(src, path)?;
    dispatch_element_type!(desc, path, copy_dataset_as(src, dst, name, path))
        .with_context(|| format!("Failed to copy dataset {:?}.", path))?;

    let copied = dst.dataset(name)?;
    copy_missing_attrs(src, &copied, path)?;
    Ok(())
}


/// Copies every attribute of `src` that `dst` lacks and returns how many were copied.
pub fn copy_missing_attrs(src: &Location, dst: &Location, path: &str) -> Result<usize> {
    let existing = dst.attr_names()?;
    let mut ncopied = 0;

    for name in src.attr_names()? {
        if existing.contains(&name) {
            continue;
        }

        let attr_path = format!("{}@{}", path, name);
        let attr = src.attr(&name)?;
        let desc = element_type(&attr, &attr_path)?;
        dispatch_element_type!(desc, attr_path, copy_attr_as(&attr, dst, &name, &attr_path))?;
        ncopied += 1;
    }

    Ok(ncopied)
}
