use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

use crate::{BitReader, BitWrite, Serde, SerdeErr};

fn ser_floats(writer: &mut dyn BitWrite, values: &[f32]) {
    for value in values {
        value.ser(writer);
    }
}

fn de_floats<const N: usize>(reader: &mut BitReader) -> Result<[f32; N], SerdeErr> {
    let mut output = [0.0_f32; N];
    for value in output.iter_mut() {
        *value = f32::de(reader)?;
    }
    Ok(output)
}

impl Serde for Vec2 {
    fn ser(&self, writer: &mut dyn BitWrite) {
        ser_floats(writer, &self.to_array());
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Vec2::from_array(de_floats::<2>(reader)?))
    }
}

impl Serde for Vec3 {
    fn ser(&self, writer: &mut dyn BitWrite) {
        ser_floats(writer, &self.to_array());
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Vec3::from_array(de_floats::<3>(reader)?))
    }
}

impl Serde for Vec4 {
    fn ser(&self, writer: &mut dyn BitWrite) {
        ser_floats(writer, &self.to_array());
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Vec4::from_array(de_floats::<4>(reader)?))
    }
}

impl Serde for Quat {
    fn ser(&self, writer: &mut dyn BitWrite) {
        ser_floats(writer, &self.to_array());
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Quat::from_array(de_floats::<4>(reader)?))
    }
}

// column-major
impl Serde for Mat4 {
    fn ser(&self, writer: &mut dyn BitWrite) {
        ser_floats(writer, &self.to_cols_array());
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Mat4::from_cols_array(&de_floats::<16>(reader)?))
    }
}
