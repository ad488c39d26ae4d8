use glam::{Quat, Vec3, Vec4};
use rayon::prelude::*;

use scenesync_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{types::INVALID_ID, Identifier};

const EPSILON: f32 = 1e-4;

/// Approximate equality used by keyframe reduction. Exact for booleans
/// and strings.
pub trait NearEqual {
    fn near_equal(&self, other: &Self) -> bool;
}

impl NearEqual for bool {
    fn near_equal(&self, other: &Self) -> bool {
        self == other
    }
}

impl NearEqual for String {
    fn near_equal(&self, other: &Self) -> bool {
        self == other
    }
}

impl NearEqual for i32 {
    fn near_equal(&self, other: &Self) -> bool {
        self == other
    }
}

impl NearEqual for f32 {
    fn near_equal(&self, other: &Self) -> bool {
        (self - other).abs() < EPSILON
    }
}

impl NearEqual for Vec3 {
    fn near_equal(&self, other: &Self) -> bool {
        self.abs_diff_eq(*other, EPSILON)
    }
}

impl NearEqual for Vec4 {
    fn near_equal(&self, other: &Self) -> bool {
        self.abs_diff_eq(*other, EPSILON)
    }
}

impl NearEqual for Quat {
    fn near_equal(&self, other: &Self) -> bool {
        self.abs_diff_eq(*other, EPSILON)
    }
}

/// A time-value pair. Curves are stored as `Vec<TVP<T>>` in increasing time order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TVP<T> {
    pub time: f32,
    pub value: T,
}

impl<T> TVP<T> {
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

impl<T: Serde> Serde for TVP<T> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.time.ser(writer);
        self.value.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            time: f32::de(reader)?,
            value: T::de(reader)?,
        })
    }
}

pub type Curve<T> = Vec<TVP<T>>;

/// Drops trailing samples while the last two are near-equal. A curve left
/// with a single sample carries no motion and is cleared.
pub fn reduce_curve<T: NearEqual>(curve: &mut Curve<T>) {
    while curve.len() >= 2 {
        let last = curve.len() - 1;
        if curve[last].value.near_equal(&curve[last - 1].value) {
            curve.pop();
        } else {
            break;
        }
    }
    if curve.len() == 1 {
        curve.clear();
    }
}

fn scale_curve_time<T>(curve: &mut Curve<T>, scale: f32) {
    for sample in curve.iter_mut() {
        sample.time *= scale;
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformAnimation {
    pub path: String,
    pub translation: Curve<Vec3>,
    pub rotation: Curve<Quat>,
    pub scale: Curve<Vec3>,
    pub visible: Curve<bool>,
}

impl TransformAnimation {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    fn reduce(&mut self) {
        reduce_curve(&mut self.translation);
        reduce_curve(&mut self.rotation);
        reduce_curve(&mut self.scale);
        reduce_curve(&mut self.visible);
    }

    fn scale_time(&mut self, scale: f32) {
        scale_curve_time(&mut self.translation, scale);
        scale_curve_time(&mut self.rotation, scale);
        scale_curve_time(&mut self.scale, scale);
        scale_curve_time(&mut self.visible, scale);
    }

    fn is_empty(&self) -> bool {
        self.translation.is_empty()
            && self.rotation.is_empty()
            && self.scale.is_empty()
            && self.visible.is_empty()
    }
}

impl Serde for TransformAnimation {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.path.ser(writer);
        self.translation.ser(writer);
        self.rotation.ser(writer);
        self.scale.ser(writer);
        self.visible.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            path: String::de(reader)?,
            translation: Vec::de(reader)?,
            rotation: Vec::de(reader)?,
            scale: Vec::de(reader)?,
            visible: Vec::de(reader)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CameraAnimation {
    pub transform: TransformAnimation,
    pub fov: Curve<f32>,
    pub near_plane: Curve<f32>,
    pub far_plane: Curve<f32>,
    pub horizontal_aperture: Curve<f32>,
    pub vertical_aperture: Curve<f32>,
    pub focal_length: Curve<f32>,
    pub focus_distance: Curve<f32>,
}

impl CameraAnimation {
    fn float_curves_mut(&mut self) -> [&mut Curve<f32>; 7] {
        [
            &mut self.fov,
            &mut self.near_plane,
            &mut self.far_plane,
            &mut self.horizontal_aperture,
            &mut self.vertical_aperture,
            &mut self.focal_length,
            &mut self.focus_distance,
        ]
    }

    fn float_curves(&self) -> [&Curve<f32>; 7] {
        [
            &self.fov,
            &self.near_plane,
            &self.far_plane,
            &self.horizontal_aperture,
            &self.vertical_aperture,
            &self.focal_length,
            &self.focus_distance,
        ]
    }
}

impl Serde for CameraAnimation {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.transform.ser(writer);
        for curve in self.float_curves() {
            curve.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            transform: TransformAnimation::de(reader)?,
            fov: Vec::de(reader)?,
            near_plane: Vec::de(reader)?,
            far_plane: Vec::de(reader)?,
            horizontal_aperture: Vec::de(reader)?,
            vertical_aperture: Vec::de(reader)?,
            focal_length: Vec::de(reader)?,
            focus_distance: Vec::de(reader)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LightAnimation {
    pub transform: TransformAnimation,
    pub color: Curve<Vec4>,
    pub intensity: Curve<f32>,
    pub range: Curve<f32>,
    pub spot_angle: Curve<f32>,
}

impl Serde for LightAnimation {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.transform.ser(writer);
        self.color.ser(writer);
        self.intensity.ser(writer);
        self.range.ser(writer);
        self.spot_angle.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            transform: TransformAnimation::de(reader)?,
            color: Vec::de(reader)?,
            intensity: Vec::de(reader)?,
            range: Vec::de(reader)?,
            spot_angle: Vec::de(reader)?,
        })
    }
}

/// Weight curve of one named blendshape
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlendshapeAnimation {
    pub name: String,
    pub weight: Curve<f32>,
}

impl Serde for BlendshapeAnimation {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.name.ser(writer);
        self.weight.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            name: String::de(reader)?,
            weight: Vec::de(reader)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshAnimation {
    pub transform: TransformAnimation,
    pub blendshapes: Vec<BlendshapeAnimation>,
}

impl MeshAnimation {
    pub fn find_or_create_blendshape(&mut self, name: &str) -> &mut BlendshapeAnimation {
        let index = match self.blendshapes.iter().position(|shape| shape.name == name) {
            Some(index) => index,
            None => {
                self.blendshapes.push(BlendshapeAnimation {
                    name: name.to_string(),
                    weight: Vec::new(),
                });
                self.blendshapes.len() - 1
            }
        };
        &mut self.blendshapes[index]
    }
}

impl Serde for MeshAnimation {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.transform.ser(writer);
        self.blendshapes.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            transform: TransformAnimation::de(reader)?,
            blendshapes: Vec::de(reader)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointsAnimation {
    pub transform: TransformAnimation,
    pub time: Curve<f32>,
}

impl Serde for PointsAnimation {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.transform.ser(writer);
        self.time.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            transform: TransformAnimation::de(reader)?,
            time: Vec::de(reader)?,
        })
    }
}

/// Per-entity animation, keyed by the animated entity's path. Variants mirror
/// the entity variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    Transform(TransformAnimation),
    Camera(CameraAnimation),
    Light(LightAnimation),
    Mesh(MeshAnimation),
    Points(PointsAnimation),
}

impl Animation {
    fn tag(&self) -> u8 {
        match self {
            Animation::Transform(_) => 1,
            Animation::Camera(_) => 2,
            Animation::Light(_) => 3,
            Animation::Mesh(_) => 4,
            Animation::Points(_) => 5,
        }
    }

    pub fn transform(&self) -> &TransformAnimation {
        match self {
            Animation::Transform(animation) => animation,
            Animation::Camera(animation) => &animation.transform,
            Animation::Light(animation) => &animation.transform,
            Animation::Mesh(animation) => &animation.transform,
            Animation::Points(animation) => &animation.transform,
        }
    }

    pub fn transform_mut(&mut self) -> &mut TransformAnimation {
        match self {
            Animation::Transform(animation) => animation,
            Animation::Camera(animation) => &mut animation.transform,
            Animation::Light(animation) => &mut animation.transform,
            Animation::Mesh(animation) => &mut animation.transform,
            Animation::Points(animation) => &mut animation.transform,
        }
    }

    pub fn path(&self) -> &str {
        &self.transform().path
    }

    /// Applies keyframe reduction to every curve, then prunes empty
    /// blendshape curves
    pub fn reduce(&mut self) {
        self.transform_mut().reduce();
        match self {
            Animation::Transform(_) => {}
            Animation::Camera(animation) => {
                for curve in animation.float_curves_mut() {
                    reduce_curve(curve);
                }
            }
            Animation::Light(animation) => {
                reduce_curve(&mut animation.color);
                reduce_curve(&mut animation.intensity);
                reduce_curve(&mut animation.range);
                reduce_curve(&mut animation.spot_angle);
            }
            Animation::Mesh(animation) => {
                for shape in animation.blendshapes.iter_mut() {
                    reduce_curve(&mut shape.weight);
                }
                animation.blendshapes.retain(|shape| !shape.weight.is_empty());
            }
            Animation::Points(animation) => reduce_curve(&mut animation.time),
        }
    }

    pub fn scale_time(&mut self, scale: f32) {
        self.transform_mut().scale_time(scale);
        match self {
            Animation::Transform(_) => {}
            Animation::Camera(animation) => {
                for curve in animation.float_curves_mut() {
                    scale_curve_time(curve, scale);
                }
            }
            Animation::Light(animation) => {
                scale_curve_time(&mut animation.color, scale);
                scale_curve_time(&mut animation.intensity, scale);
                scale_curve_time(&mut animation.range, scale);
                scale_curve_time(&mut animation.spot_angle, scale);
            }
            Animation::Mesh(animation) => {
                for shape in animation.blendshapes.iter_mut() {
                    scale_curve_time(&mut shape.weight, scale);
                }
            }
            Animation::Points(animation) => scale_curve_time(&mut animation.time, scale),
        }
    }

    /// True when no curve holds a sample
    pub fn is_empty(&self) -> bool {
        if !self.transform().is_empty() {
            return false;
        }
        match self {
            Animation::Transform(_) => true,
            Animation::Camera(animation) => {
                animation.float_curves().iter().all(|curve| curve.is_empty())
            }
            Animation::Light(animation) => {
                animation.color.is_empty()
                    && animation.intensity.is_empty()
                    && animation.range.is_empty()
                    && animation.spot_angle.is_empty()
            }
            Animation::Mesh(animation) => animation
                .blendshapes
                .iter()
                .all(|shape| shape.weight.is_empty()),
            Animation::Points(animation) => animation.time.is_empty(),
        }
    }
}

impl Serde for Animation {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.tag().ser(writer);
        match self {
            Animation::Transform(animation) => animation.ser(writer),
            Animation::Camera(animation) => animation.ser(writer),
            Animation::Light(animation) => animation.ser(writer),
            Animation::Mesh(animation) => animation.ser(writer),
            Animation::Points(animation) => animation.ser(writer),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match u8::de(reader)? {
            1 => Ok(Animation::Transform(TransformAnimation::de(reader)?)),
            2 => Ok(Animation::Camera(CameraAnimation::de(reader)?)),
            3 => Ok(Animation::Light(LightAnimation::de(reader)?)),
            4 => Ok(Animation::Mesh(MeshAnimation::de(reader)?)),
            5 => Ok(Animation::Points(PointsAnimation::de(reader)?)),
            tag => Err(SerdeErr::InvalidTag {
                type_name: "Animation",
                tag: tag as u64,
            }),
        }
    }
}

/// A named set of per-entity animations sampled at `frame_rate`
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub id: i32,
    pub name: String,
    pub frame_rate: f32,
    pub animations: Vec<Animation>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, frame_rate: f32) -> Self {
        Self {
            id: INVALID_ID,
            name: name.into(),
            frame_rate,
            animations: Vec::new(),
        }
    }

    pub fn identifier(&self) -> Identifier {
        Identifier::new(self.name.clone(), self.id)
    }

    /// Reduces every animation in parallel, then drops the ones left empty
    pub fn reduce(&mut self) {
        self.animations
            .par_iter_mut()
            .for_each(|animation| animation.reduce());
        self.animations.retain(|animation| !animation.is_empty());
    }

    pub fn scale_time(&mut self, scale: f32) {
        for animation in self.animations.iter_mut() {
            animation.scale_time(scale);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.animations.iter().all(|animation| animation.is_empty())
    }

    pub(crate) fn ser_payload(&self, writer: &mut dyn BitWrite) {
        self.frame_rate.ser(writer);
        self.animations.ser(writer);
    }

    pub(crate) fn de_payload(id: i32, name: String, reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            id,
            name,
            frame_rate: f32::de(reader)?,
            animations: Vec::de(reader)?,
        })
    }
}
